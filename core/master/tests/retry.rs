mod common;

use common::{with_bad_crc, with_crc, ScriptedTransport};
use master::{Error, ModbusMaster, WriteContext};
use transport::{Settings, TransportError};

const ACK: [u8; 6] = [0x01, 0x06, 0x00, 0x02, 0x00, 0x03];

fn settings(retry_count: u32) -> Settings {
    Settings {
        retry_count,
        ..Default::default()
    }
}

#[tokio::test]
async fn exhausted() {
    let master = ModbusMaster::new(ScriptedTransport::failing(), &Settings::default());

    let result = master.write_single_register(1, 2, 3, Some(3)).await;
    match result {
        Err(Error::RetryLimitExceeded(context)) => assert_eq!(
            context,
            WriteContext {
                slave: 1,
                register: 2,
                value: 3,
                attempt: 3,
                attempts: 3,
            }
        ),
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(master.transport().calls(), 3);
}

#[tokio::test]
async fn succeed_on_last_attempt() {
    let transport = ScriptedTransport::new(vec![
        Err(TransportError::ResponseTimeout),
        Err(TransportError::ResponseTimeout),
        Ok(with_crc(&ACK)),
    ]);
    let master = ModbusMaster::new(transport, &Settings::default());

    let response = master.write_single_register(1, 2, 3, Some(3)).await.unwrap();
    assert_eq!(response, with_crc(&ACK));
    assert_eq!(master.transport().calls(), 3);

    // every attempt sends the same frame
    let requests = master.transport().requests();
    assert!(requests.iter().all(|request| request == &requests[0]));
}

#[tokio::test]
async fn crc_mismatch_is_retried() {
    let transport = ScriptedTransport::new(vec![Ok(with_bad_crc(&ACK)), Ok(with_crc(&ACK))]);
    let master = ModbusMaster::new(transport, &Settings::default());

    assert!(master.write_single_register(1, 2, 3, Some(2)).await.is_ok());
    assert_eq!(master.transport().calls(), 2);
}

#[tokio::test]
async fn stops_after_success() {
    let transport = ScriptedTransport::new(vec![Ok(with_crc(&ACK)), Ok(with_crc(&ACK))]);
    let master = ModbusMaster::new(transport, &Settings::default());

    assert!(master.write_single_register(1, 2, 3, Some(5)).await.is_ok());
    assert_eq!(master.transport().calls(), 1);
}

#[tokio::test]
async fn configured_retry_count() {
    let master = ModbusMaster::new(ScriptedTransport::failing(), &settings(4));
    assert_eq!(master.retry_count(), 4);

    let result = master.write_single_register(1, 2, 3, None).await;
    assert!(matches!(result, Err(Error::RetryLimitExceeded(_))));
    assert_eq!(master.transport().calls(), 4);
}

#[tokio::test]
async fn explicit_count_overrides_settings() {
    let master = ModbusMaster::new(ScriptedTransport::failing(), &settings(4));

    let result = master.write_single_register(1, 2, 3, Some(1)).await;
    assert!(matches!(result, Err(Error::RetryLimitExceeded(_))));
    assert_eq!(master.transport().calls(), 1);
}

#[tokio::test]
async fn zero_retries_never_touch_the_line() {
    let transport = ScriptedTransport::new(vec![Ok(with_crc(&ACK))]);
    let master = ModbusMaster::new(transport, &Settings::default());

    let result = master.write_single_register(7, 8, 9, Some(0)).await;
    match result {
        Err(Error::RetryLimitExceeded(context)) => {
            assert_eq!(context.slave, 7);
            assert_eq!(context.attempt, 0);
            assert_eq!(context.attempts, 0);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(master.transport().calls(), 0);
}

#[tokio::test]
async fn default_settings_use_ten_attempts() {
    let master = ModbusMaster::new(ScriptedTransport::failing(), &Settings::default());

    let result = master.write_single_register(1, 2, 3, None).await;
    assert!(matches!(result, Err(Error::RetryLimitExceeded(_))));
    assert_eq!(master.transport().calls(), 10);
}
