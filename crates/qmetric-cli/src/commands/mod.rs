pub mod compare;
pub mod evaluate;
pub mod init;
pub mod lexicon;
pub mod validate;
