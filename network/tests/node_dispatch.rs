// Copyright (C) 2025-2026 The Cinder Developers.
// This file is part of the cinder library.

// The cinder library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The cinder library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the cinder library. If not, see <https://www.gnu.org/licenses/>.

mod node_dispatch {
    use cinder_network::{
        Bootstrap,
        Environment,
        Node,
        Outbound,
        Payload,
        Server,
        HEALTH_CHECK_TIMEOUT,
    };
    use cinder_objects::Transaction;
    use cinder_storage::{MemDb, PeerAddress, PeerBook};
    use cinder_testing::{
        fund_account,
        peer_address,
        random_bound_address,
        signed_transaction,
        test_blockchain,
        test_keypair,
        test_miner,
        wait_until,
        TEST_DIFFICULTY,
    };

    use parking_lot::RwLock;
    use serial_test::serial;
    use std::{sync::Arc, time::Duration};

    /// An unroutable bootstrap address; dials to it fail fast.
    fn dead_bootstrap() -> PeerAddress {
        PeerAddress::new("127.0.0.1", 1)
    }

    fn test_environment(local_address: PeerAddress, is_bootstrap: bool) -> Environment {
        let blockchain = Arc::new(RwLock::new(test_blockchain()));
        let peer_book = Arc::new(PeerBook::new(Arc::new(MemDb::new())));
        let (_, miner_address) = test_keypair();

        Environment::new(
            blockchain,
            peer_book,
            local_address,
            dead_bootstrap(),
            miner_address,
            10,
            2,
            Duration::from_secs(15),
            Duration::from_secs(30),
            is_bootstrap,
            false,
        )
        .unwrap()
    }

    fn test_node() -> Node {
        Node::new(test_environment(PeerAddress::new("localhost", 8082), false))
    }

    #[tokio::test]
    async fn health_check_registers_the_sender_and_replies_healthy() {
        let node = test_node();
        let sender = PeerAddress::new("localhost", 9001);

        let response = node
            .process_message(Payload::HealthCheck {
                address: sender.clone(),
            })
            .await;

        assert_eq!(response, Some(Payload::healthy_response()));
        assert_eq!(node.environment().peer_book().all_peers(), vec![sender]);
    }

    #[tokio::test]
    async fn genesis_health_check_replies_healthy_without_registering() {
        let node = test_node();

        let response = node.process_message(Payload::GenesisHealthCheck).await;

        assert_eq!(response, Some(Payload::genesis_healthy_response()));
        assert_eq!(node.environment().peer_book().count(), 0);
    }

    #[tokio::test]
    async fn gossiped_peers_are_registered_under_the_cap() {
        let node = test_node();

        let peers: Vec<PeerAddress> = (1..=20)
            .map(|port| PeerAddress::new("localhost", port))
            .collect();
        let response = node
            .process_message(Payload::SendPeers {
                address: PeerAddress::new("localhost", 9000),
                peers,
            })
            .await;

        assert_eq!(response, None);
        // The sender plus gossiped peers, stopping at the 10-peer cap.
        assert_eq!(node.environment().peer_book().count(), 10);
    }

    #[tokio::test]
    async fn the_local_address_is_never_registered() {
        let node = test_node();

        node.process_message(Payload::SendPeers {
            address: node.environment().local_address().clone(),
            peers: vec![node.environment().local_address().clone()],
        })
        .await;

        assert_eq!(node.environment().peer_book().count(), 0);
    }

    #[tokio::test]
    async fn a_valid_received_transaction_enters_the_mempool() {
        let node = test_node();
        let (key, sender) = test_keypair();
        fund_account(&node.environment().blockchain().read(), &sender, 50);

        let transaction = signed_transaction(&key, "receiver_address", 2.0, 0);
        node.process_message(Payload::NewTransaction {
            transaction: transaction.clone(),
            address: PeerAddress::new("localhost", 9000),
        })
        .await;

        let blockchain = node.environment().blockchain().read();
        assert_eq!(blockchain.memory_pool().len(), 1);
        assert!(blockchain.memory_pool().contains(&transaction.tx_hash));
    }

    #[tokio::test]
    async fn an_invalid_received_transaction_is_dropped() {
        let node = test_node();
        let (key, sender) = test_keypair();
        fund_account(&node.environment().blockchain().read(), &sender, 50);

        let mut transaction = signed_transaction(&key, "receiver_address", 2.0, 0);
        transaction.signature = Some("a".repeat(128));
        node.process_message(Payload::NewTransaction {
            transaction,
            address: PeerAddress::new("localhost", 9000),
        })
        .await;

        assert!(node.environment().blockchain().read().memory_pool().is_empty());
    }

    #[tokio::test]
    async fn a_valid_received_block_extends_the_chain() {
        let node = test_node();
        let (key, sender) = test_keypair();
        fund_account(&node.environment().blockchain().read(), &sender, 50);

        // Mine the block on a second node holding the same chain state.
        let remote = test_node();
        fund_account(&remote.environment().blockchain().read(), &sender, 50);
        {
            let mut blockchain = remote.environment().blockchain().write();
            for nonce in 0..3 {
                assert!(blockchain.add_transaction(signed_transaction(&key, "receiver_address", 1.0, nonce)));
            }
        }
        let miner = test_miner("miner_123".to_owned());
        let mut block = miner.establish_block(&remote.environment().blockchain().read());
        block.mine(TEST_DIFFICULTY);

        // Garble the claimed hashes; dispatch must reconstruct, not trust.
        let mut announced = block.clone();
        announced.hash = "f".repeat(64);

        node.process_message(Payload::NewBlockMined {
            block: announced,
            address: PeerAddress::new("localhost", 9000),
        })
        .await;

        let blockchain = node.environment().blockchain().read();
        assert_eq!(blockchain.block_height(), 2);
        assert_eq!(blockchain.latest_block().hash, block.hash);
        assert_eq!(blockchain.ledger().get_balance("miner_123"), Some(10_000_000));
    }

    #[tokio::test]
    async fn a_block_on_an_unknown_tip_is_dropped() {
        let node = test_node();

        let mut block = cinder_objects::Block::new(
            1,
            "1234567890abcdef".to_owned(),
            vec![Transaction::coinbase("miner_123".to_owned())],
        );
        block.mine(TEST_DIFFICULTY);

        node.process_message(Payload::NewBlockMined {
            block,
            address: PeerAddress::new("localhost", 9000),
        })
        .await;

        assert_eq!(node.environment().blockchain().read().block_height(), 1);
    }

    #[tokio::test]
    async fn the_bootstrap_directory_hands_out_peers() {
        let bootstrap = Bootstrap::new(test_environment(PeerAddress::new("localhost", 3070), true));
        for port in 1..=3 {
            bootstrap
                .environment()
                .peer_book()
                .add_peer(&PeerAddress::new("localhost", port), None);
        }

        let requester = PeerAddress::new("localhost", 9000);
        let response = bootstrap
            .process_message(Payload::RequestPeers {
                address: requester.clone(),
            })
            .await;

        match response {
            Some(Payload::FromGenesis { peers }) => {
                assert_eq!(peers.len(), 3);
                assert!(!peers.contains(&requester));
            }
            other => panic!("expected a from_genesis response, got {:?}", other),
        }
        // The requester itself was registered for future hand-outs.
        assert_eq!(bootstrap.environment().peer_book().count(), 4);
    }

    #[tokio::test]
    async fn the_bootstrap_directory_ignores_node_messages() {
        let bootstrap = Bootstrap::new(test_environment(PeerAddress::new("localhost", 3070), true));

        let response = bootstrap
            .process_message(Payload::HealthCheck {
                address: PeerAddress::new("localhost", 9000),
            })
            .await;

        assert_eq!(response, None);
        assert_eq!(bootstrap.environment().peer_book().count(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn a_running_server_answers_health_checks() {
        // Reserve an ephemeral port, then hand it to the server.
        let (addr, listener) = random_bound_address().await;
        drop(listener);

        let local_address = peer_address(addr);
        let environment = test_environment(local_address.clone(), false);
        let server = Server::new(environment.clone());
        tokio::spawn(async move {
            server.start().await.unwrap();
        });

        let prober = PeerAddress::new("127.0.0.1", 9000);
        let outbound = Outbound::new(
            Arc::new(PeerBook::new(Arc::new(MemDb::new()))),
            prober.clone(),
        );

        // Retry until the listener is up.
        let response = loop {
            match outbound
                .request(
                    &local_address,
                    &Payload::HealthCheck {
                        address: prober.clone(),
                    },
                    HEALTH_CHECK_TIMEOUT,
                )
                .await
            {
                Ok(response) => break response,
                Err(_) => tokio::time::sleep(Duration::from_millis(20)).await,
            }
        };

        assert_eq!(response, Payload::healthy_response());
        wait_until!(5, environment.peer_book().all_peers().contains(&prober));
    }

    #[tokio::test]
    #[serial]
    async fn a_running_server_adopts_gossiped_peers() {
        let (addr, listener) = random_bound_address().await;
        drop(listener);

        let local_address = peer_address(addr);
        let environment = test_environment(local_address.clone(), false);
        let server = Server::new(environment.clone());
        tokio::spawn(async move {
            server.start().await.unwrap();
        });

        let gossiper = PeerAddress::new("127.0.0.1", 9001);
        let outbound = Outbound::new(
            Arc::new(PeerBook::new(Arc::new(MemDb::new()))),
            gossiper.clone(),
        );

        let message = Payload::SendPeers {
            address: gossiper.clone(),
            peers: vec![PeerAddress::new("127.0.0.1", 9002)],
        };
        while outbound.send_to(&local_address, &message).await.is_err() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        wait_until!(5, environment.peer_book().count() == 2);
    }
}
