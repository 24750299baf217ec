use crate::case::service::Catalog;
use crate::persistence::table::Table;
use crate::report::model::Report;
use crate::report::service::ReportOperations;
use crate::result::model::TestResult;
use crate::result::service::ResultOperations;
use crate::run::model::Run;
use crate::run::service::RunOperations;
use std::sync::Arc;

/// Owns the catalog and every in-memory table. Cloning shares the tables.
#[derive(Clone)]
pub struct Repository {
    catalog: Arc<Catalog>,
    runs: Arc<Table<Run>>,
    results: Arc<Table<TestResult>>,
    reports: Arc<Table<Report>>,
}

impl Repository {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            runs: Arc::new(Table::new("runs")),
            results: Arc::new(Table::new("results")),
            reports: Arc::new(Table::new("reports")),
        }
    }

    pub fn test_cases(&self) -> &Catalog {
        &self.catalog
    }

    pub fn runs(&self) -> RunOperations {
        RunOperations {
            catalog: self.catalog.clone(),
            runs: self.runs.clone(),
            results: self.results(),
        }
    }

    pub fn results(&self) -> ResultOperations {
        ResultOperations {
            results: self.results.clone(),
        }
    }

    pub fn reports(&self) -> ReportOperations {
        ReportOperations {
            results: self.results.clone(),
            reports: self.reports.clone(),
        }
    }
}
