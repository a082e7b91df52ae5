pub mod chart_payload_dto;
