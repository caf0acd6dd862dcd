mod loading;
mod samples;
