macro_rules! nutype_string {
    ($(#[$meta:meta])* $ident:ident ( $($attr:ident $args:tt),* $(,)? )) => {
        $(#[$meta])*
        #[::nutype::nutype(
            $($attr $args,)*
            derive(Debug, Clone, PartialEq, Eq, Deref, TryFrom, Serialize, Deserialize),
        )]
        pub struct $ident(String);
    };
}

macro_rules! sensitive_debug {
    ($ident:ident < $($generics:ident),* >) => {
        impl<$($generics),*> ::core::fmt::Debug for $ident<$($generics),*> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str("[sensitive]")
            }
        }
    };
}

pub(crate) use nutype_string;
pub(crate) use sensitive_debug;
