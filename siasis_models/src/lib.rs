use std::ops::Deref;

use macros::sensitive_debug;
use serde::{Deserialize, Serialize};

pub mod email_address;
mod macros;
pub mod submission;

/// Wrapper for secrets which must never show up in logs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive<T>(pub T);
sensitive_debug!(Sensitive<T>);

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Sensitive<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitive_debug_is_redacted() {
        let secret = Sensitive("ghp_secret".to_owned());
        assert_eq!(format!("{secret:?}"), "[sensitive]");
        assert_eq!(*secret, "ghp_secret");
    }
}
