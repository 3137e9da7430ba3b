/// Panics unless the value of `$expr` matches `$pat`, and the optional guard
/// holds. The value is matched by reference.
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(if $guard:expr)? $(,)?) => {
        match &$expr {
            $pat $(if $guard)? => {}
            value => ::core::panic!(
                "assertion failed: {:?} does not match {}",
                value,
                ::core::stringify!($pat $(if $guard)?),
            ),
        }
    };
}
