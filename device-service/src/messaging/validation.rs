//! Device validation responder.
//!
//! Subscribes once to `{base}/{service}/validatedevice` and answers every
//! inbound request with exactly one response on
//! `{base}/response/{service}/{requestId}`. Envelopes are handled in
//! parallel: each message gets its own task, so a slow driver delays only
//! its own response. No ordering is promised between responses.

use log::{debug, error, info};
use tokio::sync::mpsc;

use common::topics::{build_request_topic, build_response_topic, sanitize_segment};
use common::{decode_add_device_request, MessageEnvelope, Result};

use crate::context::ServiceContext;
use crate::messaging::client::{TopicChannel, DEFAULT_CHANNEL_CAPACITY};

/// Subscribes to the validation request topic and spawns the drain task.
/// Returns an error only if the subscription itself fails; from then on all
/// failures are per-message and reported through response envelopes.
pub async fn subscribe_device_validation(ctx: ServiceContext) -> Result<()> {
    sanitize_segment(&ctx.config.service_name)?;
    let request_topic =
        build_request_topic(&ctx.config.base_topic, &ctx.config.service_name);
    let (sender, mut receiver) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

    ctx.bus
        .subscribe(vec![TopicChannel {
            topic: request_topic.clone(),
            messages: sender,
        }])
        .await?;
    info!("subscribed to device validation requests on {}", request_topic);

    tokio::spawn(async move {
        while let Some(envelope) = receiver.recv().await {
            debug!(
                "validation request received, requestId={}",
                envelope.request_id
            );
            let ctx = ctx.clone();
            tokio::spawn(async move {
                handle_validation_request(ctx, envelope).await;
            });
        }
        debug!("validation request channel closed, responder stopping");
    });

    Ok(())
}

/// Handles a single request envelope: decode, validate, respond. Exactly one
/// publish happens per call, whatever the outcome.
async fn handle_validation_request(ctx: ServiceContext, request: MessageEnvelope) {
    // A request id carrying the separator has no unambiguous reply topic;
    // the only safe handling is to drop the message.
    if let Err(e) = sanitize_segment(&request.request_id) {
        error!("dropping validation request with unusable request id: {}", e);
        return;
    }

    let response_topic = build_response_topic(
        &ctx.config.base_topic,
        &ctx.config.service_name,
        &request.request_id,
    );

    let response = match validate(&ctx, &request).await {
        Ok(device_name) => {
            info!("device {} validated successfully", device_name);
            MessageEnvelope::new_success_response(&request)
        }
        Err(e) => {
            error!(
                "device validation failed for requestId={}: {}",
                request.request_id, e
            );
            MessageEnvelope::new_error_response(&request.request_id, &e.to_string())
        }
    };

    // A lost response is the transport's problem to retry, not ours.
    if let Err(e) = ctx.bus.publish(response, &response_topic).await {
        error!(
            "failed to publish validation response to {}: {}",
            response_topic, e
        );
    }
}

async fn validate(ctx: &ServiceContext, request: &MessageEnvelope) -> Result<String> {
    let add_request = decode_add_device_request(&request.payload)?;
    let device_name = add_request.device.name.clone();
    ctx.driver.validate_device(add_request.device).await?;
    Ok(device_name)
}
