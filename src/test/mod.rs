mod analysis;
mod app;
mod market;
mod watchlist;
