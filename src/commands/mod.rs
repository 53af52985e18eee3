pub mod cameras;
