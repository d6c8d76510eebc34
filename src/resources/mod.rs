pub mod loading;
pub mod stemmer;
