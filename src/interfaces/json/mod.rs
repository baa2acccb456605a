pub mod balance_report;
