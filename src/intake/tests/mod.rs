mod classify;
mod common;
mod extract;
mod service;
