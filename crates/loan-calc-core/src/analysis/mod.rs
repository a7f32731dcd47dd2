pub mod loan_report;
