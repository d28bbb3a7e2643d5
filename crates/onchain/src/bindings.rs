// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Contract interface descriptors
//!
//! The interfaces mirror the deployed `FractionalNFT` and `FractionalToken`
//! build artifacts; only the functions this service invokes are declared.

use alloy::sol;

sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract FractionalNFT {
        struct Metadata {
            string loan_number;
            uint8 risk_tier;
            uint256 principal;
            uint256 interest;
            uint256 term;
            string school;
        }

        function mintAndFractionalize(
            address to,
            string calldata uri,
            uint256 totalFractions,
            string calldata loan_number,
            uint8 risk_tier,
            uint256 principal,
            uint256 interest,
            uint256 term,
            string calldata school
        ) external returns (uint256 mintedId);

        function fractionalToken() external view returns (address);
        function getMetadata(uint256 queriedId) external view returns (Metadata memory);
        function tokenId() external view returns (uint256);
    }

    #[derive(Debug)]
    #[sol(rpc)]
    contract FractionalToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}
