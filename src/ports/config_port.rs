//! Configuration access port trait.
//!
//! Lookups are by `(section, key)`. Typed getters fall back to `default` when
//! the key is absent or does not parse; use [`ConfigPort::get_string`] when a
//! caller needs to tell the two apart.

pub trait ConfigPort {
    /// Trimmed value, or `None` when the key is absent or blank.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
