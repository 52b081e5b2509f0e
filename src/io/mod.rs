pub mod csv_writer;
pub mod json_writer;
pub mod summary;
pub mod table;
