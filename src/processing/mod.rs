pub mod alias;
pub mod extractors;
pub mod normalizer;
pub mod ocr;
pub mod standardize;

pub use alias::AliasMatcher;
pub use extractors::FieldExtractor;
pub use normalizer::{title_case, TokenNormalizer};
pub use ocr::OcrDetailReader;
