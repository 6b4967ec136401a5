mod capture;
mod player;
mod resampler;
