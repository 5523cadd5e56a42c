pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    FileReader, GenerateFeedbackUseCase, HttpClient, ImageManipulator, PrepareImageUseCase,
    ProgressSink,
};

pub use connector::{
    build_http_client, ImageCrateManipulator, LocalFileReader, ReqwestHttpClient,
    RetryingHttpClient, SpinnerProgress,
};

pub use domain::{
    resolve_content_type, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ClientConfig, CompressionAttempt, DomainError, FileReference, OutputFormat,
};
