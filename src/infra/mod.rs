pub mod csv_output_adapter;
pub mod places_http;
