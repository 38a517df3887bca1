#![allow(dead_code)]

pub mod order_book;
pub mod types;

pub use order_book::{BookError, QueueOrderBook, QuotePlacement};
pub use types::{Fill, Order, Price, Qty, Side, Ts};
