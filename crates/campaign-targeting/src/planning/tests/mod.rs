mod common;
mod recommender;
