#![allow(clippy::cast_precision_loss)]

mod algorithms;
mod common;
mod end_to_end;
mod errors;
mod history;
