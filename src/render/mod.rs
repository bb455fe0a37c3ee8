/// Output side: charts, their storage, and the row preview.
pub mod plot;
pub mod preview;
pub mod storage;
