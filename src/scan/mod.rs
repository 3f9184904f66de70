pub mod report_scan;
