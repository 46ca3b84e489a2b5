pub mod hash;
pub mod locale;
pub mod localize;
pub mod manifest;
pub mod pathenc;
pub mod progress;
pub mod repair;
pub mod scan;
pub mod session;
pub mod verify;
