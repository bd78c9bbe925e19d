mod csv_record_sink;

pub use csv_record_sink::CsvRecordSink;
