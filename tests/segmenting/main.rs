mod properties;
mod samples;
mod scenarios;
