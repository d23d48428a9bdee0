pub mod stats_dto;

pub use stats_dto::{CategoryCountDto, DailyCountDto, KpisDto, LocationDto, StatsResponseDto};
