//! DICOM export configuration types

use dicom_dictionary_std::uids;

/// Transfer syntaxes the writer can encode the data set with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSyntax {
    /// Explicit VR Little Endian (default, most widely accepted)
    ExplicitVrLittleEndian,
    /// Implicit VR Little Endian (the DICOM default transfer syntax)
    ImplicitVrLittleEndian,
}

impl TransferSyntax {
    pub fn uid(&self) -> &'static str {
        match self {
            TransferSyntax::ExplicitVrLittleEndian => uids::EXPLICIT_VR_LITTLE_ENDIAN,
            TransferSyntax::ImplicitVrLittleEndian => uids::IMPLICIT_VR_LITTLE_ENDIAN,
        }
    }
}

/// Configuration for writing reconstructed DICOM files
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Transfer syntax recorded in the file meta group and used for the data set
    pub transfer_syntax: TransferSyntax,
    /// Whether to stamp ContentDate / ContentTime with the wall-clock time of the save
    pub stamp_content_datetime: bool,
    /// Whether to create missing parent directories of the output path
    pub create_parent_dirs: bool,
    /// Whether to reject zero or oversized image dimensions
    pub validate_dimensions: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            transfer_syntax: TransferSyntax::ExplicitVrLittleEndian,
            stamp_content_datetime: true,
            create_parent_dirs: true,
            validate_dimensions: true,
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }
}

/// Builder for ExportConfig
#[derive(Default)]
pub struct ExportConfigBuilder {
    transfer_syntax: Option<TransferSyntax>,
    stamp_content_datetime: Option<bool>,
    create_parent_dirs: Option<bool>,
    validate_dimensions: Option<bool>,
}

impl ExportConfigBuilder {
    pub fn transfer_syntax(mut self, transfer_syntax: TransferSyntax) -> Self {
        self.transfer_syntax = Some(transfer_syntax);
        self
    }

    pub fn stamp_content_datetime(mut self, enable: bool) -> Self {
        self.stamp_content_datetime = Some(enable);
        self
    }

    pub fn create_parent_dirs(mut self, enable: bool) -> Self {
        self.create_parent_dirs = Some(enable);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> ExportConfig {
        let default = ExportConfig::default();
        ExportConfig {
            transfer_syntax: self.transfer_syntax.unwrap_or(default.transfer_syntax),
            stamp_content_datetime: self
                .stamp_content_datetime
                .unwrap_or(default.stamp_content_datetime),
            create_parent_dirs: self.create_parent_dirs.unwrap_or(default.create_parent_dirs),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
