mod engine_tests;
mod field_tests;
