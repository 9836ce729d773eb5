//! Generated gRPC types for FitFusion services.

pub mod cascade {
    tonic::include_proto!("fitfusion.cascade");
}

pub mod identity {
    tonic::include_proto!("fitfusion.identity");
}
