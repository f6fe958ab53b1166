mod bulk;
mod common;
mod uniqueness;
