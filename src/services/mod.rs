/// Business operations behind the HTTP handlers

mod credentials;
mod groups;

pub use credentials::CredentialService;
pub use groups::{GroupDetails, GroupService};
