pub mod corridor;
