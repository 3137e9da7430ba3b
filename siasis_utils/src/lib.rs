mod macros;

/// Returns the version of the SIASIS backend.
pub const fn siasis_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub trait Apply: Sized {
    /// Passes `self` through `f` when `value` is present, otherwise returns it
    /// unchanged. Useful for optional steps in builder chains.
    ///
    /// ```rust
    /// # use siasis_utils::Apply;
    /// let greeting = String::from("Hola").apply_map(Some("Lima"), |s, city| s + ", " + city);
    /// assert_eq!(greeting, "Hola, Lima");
    /// assert_eq!(String::from("Hola").apply_map(None::<&str>, |s, _| s), "Hola");
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self {
        match value {
            Some(value) => f(self, value),
            None => self,
        }
    }
}

impl<T> Apply for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_map() {
        let sum = |a: i32, b: Option<i32>| a.apply_map(b, |a, b| a + b);
        assert_eq!(sum(1, None), 1);
        assert_eq!(sum(1, Some(2)), 3);
    }

    #[test]
    fn assert_matches_guard() {
        crate::assert_matches!(Some(4), Some(x) if x % 2 == 0);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn assert_matches_mismatch() {
        crate::assert_matches!(None::<i32>, Some(_));
    }
}
