pub mod helpers;

mod query;
