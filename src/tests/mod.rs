pub mod support;

mod cache;
