//! QR decomposition with column pivoting

pub mod householder;
pub mod pivoted;
pub mod truncate;

pub use pivoted::PivotedQr;
pub use truncate::truncate_qr_result;
