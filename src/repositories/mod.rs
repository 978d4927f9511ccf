pub mod comment_repository;
pub mod like_repository;
pub mod profile_repository;
pub mod recipe_repository;
pub mod social_repository;
