pub mod tr_market;
