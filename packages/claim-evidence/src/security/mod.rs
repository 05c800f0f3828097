pub mod credentials;

pub use credentials::{EutilsCredentials, SecretString};
