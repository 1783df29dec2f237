mod persistence_tests;
mod store_tests;
