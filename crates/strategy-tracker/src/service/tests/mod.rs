mod cascade;
mod common;
mod tenancy;
