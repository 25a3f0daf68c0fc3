pub mod directory_error;
