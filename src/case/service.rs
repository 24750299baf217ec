use crate::api::AppError;
use crate::case::model::TestCase;

/// Fixed registry of test cases, built once at startup and never mutated.
pub struct Catalog {
    test_cases: Vec<TestCase>,
}

impl Catalog {
    pub fn new(test_cases: Vec<TestCase>) -> Self {
        Self { test_cases }
    }

    pub fn seeded() -> Self {
        Self::new(vec![
            TestCase::builder()
                .id("test1")
                .name("Test 1")
                .description("Homepage test")
                .url("https://example.com")
                .build(),
            TestCase::builder()
                .id("test2")
                .name("Test 2")
                .description("Login test")
                .url("https://google.com")
                .build(),
            TestCase::builder()
                .id("test3")
                .name("Test 3")
                .description("Checkout test")
                .url("https://bing.com")
                .build(),
        ])
    }

    pub fn get(&self, id: &str) -> Result<TestCase, AppError> {
        self.test_cases
            .iter()
            .find(|test_case| test_case.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Test not found".to_string()))
    }

    pub fn list(&self) -> Vec<TestCase> {
        self.test_cases.clone()
    }
}
