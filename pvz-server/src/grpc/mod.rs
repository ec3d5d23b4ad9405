//! Read-only gRPC API
//!
//! `pvz.v1.PVZService/GetPVZList` lists every pickup point. There is no
//! authentication on this listener.

pub mod proto {
    tonic::include_proto!("pvz.v1");
}

use std::sync::Arc;

use prost_types::Timestamp;
use shared::models::PickupPoint;
use tonic::{Request, Response, Status};

use crate::lifecycle::ReceptionEngine;
use proto::pvz_service_server::{PvzService, PvzServiceServer};
use proto::{GetPvzListRequest, GetPvzListResponse, Pvz};

#[derive(Clone)]
pub struct PvzGrpcService {
    engine: Arc<ReceptionEngine>,
}

impl PvzGrpcService {
    pub fn new(engine: Arc<ReceptionEngine>) -> Self {
        Self { engine }
    }

    pub fn into_server(self) -> PvzServiceServer<Self> {
        PvzServiceServer::new(self)
    }
}

impl From<PickupPoint> for Pvz {
    fn from(pvz: PickupPoint) -> Self {
        Self {
            id: pvz.id.to_string(),
            registration_date: Some(Timestamp {
                seconds: pvz.registration_date.timestamp(),
                nanos: pvz.registration_date.timestamp_subsec_nanos() as i32,
            }),
            city: pvz.city.as_str().to_string(),
        }
    }
}

#[tonic::async_trait]
impl PvzService for PvzGrpcService {
    async fn get_pvz_list(
        &self,
        _request: Request<GetPvzListRequest>,
    ) -> Result<Response<GetPvzListResponse>, Status> {
        let pvzs = self.engine.list_pickup_points().await.map_err(|e| {
            tracing::error!(error = ?e, "grpc: listing pickup points failed");
            Status::internal("internal error")
        })?;

        Ok(Response::new(GetPvzListResponse {
            pvzs: pvzs.into_iter().map(Pvz::from).collect(),
        }))
    }
}
