mod build_tests;
mod runtime_tests;
