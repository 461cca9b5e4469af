use crate::*;

use bytes::Bytes;
use hlf_core::IdentityContext;
use hlf_services::cscc::STATUS_OK;
use hlf_services::{joined_channels, CsccProposal};

const PEERS: [&str; 2] = ["peer0.org1.example.com:7051", "peer1.org1.example.com:7051"];

fn cscc(peers: &FakePeers) -> CsccProposal<&FakePeers> {
    CsccProposal::new(
        IdentityContext::from_creator(MSP_ID, CREATOR.to_vec()),
        "",
        PEERS.iter().map(|p| p.to_string()).collect(),
        peers,
    )
}

fn genesis(channel: &str) -> Bytes {
    Bytes::from(config_block(channel, 0).encode_to_vec())
}

#[tokio::test]
async fn test_join_then_query_channels() {
    let peers = FakePeers::default();
    let admin = cscc(&peers);

    let responses = admin.join_channel(genesis(CHANNEL)).await.unwrap();
    assert_eq!(responses.len(), PEERS.len());
    for r in &responses {
        assert_eq!(r.response.as_ref().unwrap().status, STATUS_OK);
    }

    admin.join_channel(genesis("otherchannel")).await.unwrap();

    let responses = admin.query_channels().await.unwrap();
    for r in &responses {
        assert_eq!(
            joined_channels(r).unwrap(),
            vec![CHANNEL.to_string(), "otherchannel".to_string()]
        );
    }
    assert_eq!(peers.channels_of(PEERS[1]).len(), 2);
}

#[tokio::test]
async fn test_join_rejected_for_non_config_block() {
    let peers = FakePeers::default();
    let admin = cscc(&peers);

    let tx = envelope_bytes(HeaderType::EndorserTransaction, CHANNEL, Vec::new());
    let data_block = Bytes::from(block(3, vec![tx], Some(0)).encode_to_vec());

    let responses = admin.join_channel(data_block).await.unwrap();
    let inner = responses[0].response.as_ref().unwrap();
    assert_eq!(inner.status, 500);
    assert!(inner.message.contains("CONFIG"), "{}", inner.message);
    assert!(peers.channels_of(PEERS[0]).is_empty());
}

#[tokio::test]
async fn test_rejoin_reports_peer_error_per_endorser() {
    let peers = FakePeers::default();
    let admin = cscc(&peers);

    admin.join_channel(genesis(CHANNEL)).await.unwrap();
    let responses = admin.join_channel(genesis(CHANNEL)).await.unwrap();
    assert!(responses
        .iter()
        .all(|r| r.response.as_ref().unwrap().status != STATUS_OK));
}

#[tokio::test]
async fn test_proposal_targets_cscc_on_empty_channel() {
    let peers = FakePeers::default();
    let admin = cscc(&peers);
    let (proposal, tx) = admin
        .manager()
        .build_proposal(&hlf_services::BuildProposalRequest::new(
            "GetChannels",
            Vec::new(),
        ));

    let header = hlf_core::wire::Header::decode(proposal.header.as_slice()).unwrap();
    let channel_header =
        hlf_core::wire::ChannelHeader::decode(header.channel_header.as_slice()).unwrap();
    assert_eq!(channel_header.channel_id, "");
    assert_eq!(channel_header.tx_id, tx.tx_id);
    assert_eq!(
        channel_header.r#type,
        HeaderType::EndorserTransaction as i32
    );
    assert_eq!(proposal_args(&proposal).unwrap(), vec![b"GetChannels".to_vec()]);
}
