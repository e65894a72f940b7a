mod support;
mod worker_lifecycle_tests;
