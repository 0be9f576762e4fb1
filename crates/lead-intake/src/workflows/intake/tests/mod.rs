mod common;
mod mapper;
