mod helpers;
mod notify;
