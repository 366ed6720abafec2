mod board;
mod cli;
mod common;
mod persist;
