pub mod canonicalize;
pub mod confirm;
pub mod settle;
pub mod verify_confirmation;
