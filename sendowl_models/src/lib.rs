#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fields;
pub mod id;
pub mod license;
pub mod page;
pub mod product;
