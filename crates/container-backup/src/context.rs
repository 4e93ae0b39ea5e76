//! Context for the current container backup
//!

use core::fmt;

/// Context for the container currently being backed up.
pub struct Context<'a> {
    /// The source account name.
    pub account: &'a str,

    /// The source container name.
    pub container: &'a str,
}

impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.account, self.container)
    }
}
