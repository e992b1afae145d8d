pub mod db;
pub mod cart {
    pub mod entity;
    pub mod repository;
}
