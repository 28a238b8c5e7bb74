// ABOUTME: Shared configuration names for the CRM
// ABOUTME: Environment variable names and their defaults

pub mod constants;
