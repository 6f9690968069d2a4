mod conversion_dto;

pub use conversion_dto::ConvertImageDto;
